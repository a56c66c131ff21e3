use super::demand::{apply_demand, compute_ingredient_demand, parse_recipes, parse_sales_plan};
use super::loader::{load_snapshots, parse_snapshot};
use super::trend::predict_next_quantities;
use super::usage::{attach_metadata, compute_reorder, compute_usage, QuantityMatrix};
use crate::config::ForecastConfig;
use crate::db::artifact::{self, ORDERS_FILE};
use crate::error::ForecastError;
use crate::models::{OrderTable, Recipe, SalesPlanEntry, Snapshot};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const RECIPES_FILE: &str = "recipes.csv";
pub const SALES_PLAN_FILE: &str = "sales_plan.csv";

/// 一次预测的全部输入
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    /// 按时间顺序, 第一个最早
    pub snapshots: Vec<Snapshot>,
    pub recipes: Option<Vec<Recipe>>,
    pub sales_plan: Option<Vec<SalesPlanEntry>>,
    pub predict_trend: bool,
}

/// 用量 -> 元数据 -> 订货量 -> (趋势) -> (原料需求), 结果按 Item 排序
pub fn run_pipeline(input: PipelineInput) -> Result<OrderTable, ForecastError> {
    let unified = load_snapshots(input.snapshots)?;
    let matrix = QuantityMatrix::from_table(&unified);

    let usage = compute_usage(&matrix);
    tracing::debug!(
        "Computed usage for {} items over {} periods",
        usage.len(),
        matrix.periods()
    );

    let mut table = compute_reorder(attach_metadata(&usage, &unified));

    if input.predict_trend {
        let predictions = predict_next_quantities(&matrix);
        for row in &mut table.rows {
            row.predicted_quantity = predictions.get(&row.item).copied().flatten();
        }
        table.has_prediction = true;
    }

    let demand = compute_ingredient_demand(input.recipes.as_deref(), input.sales_plan.as_deref());
    if !demand.is_empty() {
        tracing::debug!("Folding demand for {} ingredients", demand.len());
    }
    let mut table = apply_demand(table, &demand);

    table.sort_by_item();
    Ok(table)
}

/// 一次上传: 周快照原始内容 (按周序) 与可选的销售计划
#[derive(Debug, Clone, Default)]
pub struct ForecastUpload {
    pub weeks: Vec<Vec<u8>>,
    pub sales_plan: Option<Vec<u8>>,
}

/// 预测服务: 管理数据目录中的上传存档、配方表与结果文件
pub struct ForecastService {
    data_dir: PathBuf,
    required_weeks: usize,
}

impl ForecastService {
    pub fn new(config: &ForecastConfig) -> Result<Self, ForecastError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self {
            data_dir: config.data_dir.clone(),
            required_weeks: config.required_weeks,
        })
    }

    pub fn required_weeks(&self) -> usize {
        self.required_weeks
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join(ORDERS_FILE)
    }

    /// 校验并存档上传文件, 运行完整流水线 (含趋势预测), 保存并返回结果
    ///
    /// 上传内容全部解析成功后才写入数据目录。
    /// 本次未上传销售计划时沿用上次保存的 sales_plan.csv。
    pub fn run(&self, upload: ForecastUpload) -> Result<OrderTable, ForecastError> {
        let snapshots = upload
            .weeks
            .iter()
            .enumerate()
            .map(|(idx, content)| parse_snapshot(&week_name(idx), content.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;
        let uploaded_plan = upload
            .sales_plan
            .as_deref()
            .map(parse_sales_plan)
            .transpose()?;

        for (idx, content) in upload.weeks.iter().enumerate() {
            let path = self.data_dir.join(format!("{}_inventory.csv", week_name(idx)));
            fs::write(path, content)?;
        }

        let sales_plan_path = self.data_dir.join(SALES_PLAN_FILE);
        let sales_plan = match (uploaded_plan, &upload.sales_plan) {
            (Some(plan), Some(content)) => {
                fs::write(&sales_plan_path, content)?;
                Some(plan)
            }
            _ => read_optional(&sales_plan_path, parse_sales_plan)?,
        };
        let recipes = read_optional(&self.data_dir.join(RECIPES_FILE), parse_recipes)?;

        tracing::info!(
            "Running forecast: {} snapshots, recipes: {}, sales plan: {}",
            snapshots.len(),
            recipes.is_some(),
            sales_plan.is_some()
        );

        let table = run_pipeline(PipelineInput {
            snapshots,
            recipes,
            sales_plan,
            predict_trend: true,
        })?;

        artifact::export_orders(&table, &self.orders_path())?;
        Ok(table)
    }

    /// 最近一次保存的结果, 尚未运行过时为 None
    pub fn latest(&self) -> Result<Option<Vec<Map<String, Value>>>, ForecastError> {
        artifact::load_orders(&self.orders_path())
    }
}

fn week_name(idx: usize) -> String {
    format!("week{}", idx + 1)
}

fn read_optional<T>(
    path: &Path,
    parse: impl FnOnce(fs::File) -> Result<T, ForecastError>,
) -> Result<Option<T>, ForecastError> {
    if !path.exists() {
        return Ok(None);
    }
    parse(fs::File::open(path)?).map(Some)
}
