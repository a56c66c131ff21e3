use super::tabular::CsvTable;
use crate::error::ForecastError;
use crate::models::{OrderTable, Recipe, SalesPlanEntry};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::io::Read;

/// 解析配方表 (Dish, Ingredient, Unit, QtyPerDish 均为必需列)
pub fn parse_recipes<R: Read>(reader: R) -> Result<Vec<Recipe>, ForecastError> {
    let table = CsvTable::read("recipes", reader)?;
    let dish_idx = table.require("Dish")?;
    let ingredient_idx = table.require("Ingredient")?;
    let unit_idx = table.require("Unit")?;
    let qty_idx = table.require("QtyPerDish")?;

    let mut recipes = Vec::new();
    for (row_no, record) in table.rows() {
        let (Some(dish), Some(ingredient)) = (
            CsvTable::text(record, dish_idx),
            CsvTable::text(record, ingredient_idx),
        ) else {
            continue;
        };
        recipes.push(Recipe {
            dish: dish.to_string(),
            ingredient: ingredient.to_string(),
            unit: CsvTable::text(record, unit_idx).map(str::to_string),
            qty_per_dish: table.number(record, qty_idx, row_no)?.unwrap_or(0.0),
        });
    }
    Ok(recipes)
}

/// 解析销售计划 (Dish, Qty 必需; Multiplier 可选, 缺省 1.0)
pub fn parse_sales_plan<R: Read>(reader: R) -> Result<Vec<SalesPlanEntry>, ForecastError> {
    let table = CsvTable::read("sales plan", reader)?;
    let dish_idx = table.require("Dish")?;
    let qty_idx = table.require("Qty")?;
    let multiplier_idx = table.column("Multiplier");

    let mut plan = Vec::new();
    for (row_no, record) in table.rows() {
        let Some(dish) = CsvTable::text(record, dish_idx) else {
            continue;
        };
        let multiplier = match multiplier_idx {
            Some(idx) => table.number(record, idx, row_no)?.unwrap_or(1.0),
            None => 1.0,
        };
        plan.push(SalesPlanEntry {
            dish: dish.to_string(),
            qty: table.number(record, qty_idx, row_no)?.unwrap_or(0.0),
            multiplier,
        });
    }
    Ok(plan)
}

/// 原料需求 = Σ Qty * Multiplier * QtyPerDish, 按原料汇总
///
/// 任一表缺失时返回空集合; 没有配方的菜品被忽略。
pub fn compute_ingredient_demand(
    recipes: Option<&[Recipe]>,
    plan: Option<&[SalesPlanEntry]>,
) -> IndexMap<String, f64> {
    let (Some(recipes), Some(plan)) = (recipes, plan) else {
        return IndexMap::new();
    };

    let mut by_dish: HashMap<&str, Vec<&Recipe>> = HashMap::new();
    for recipe in recipes {
        by_dish.entry(recipe.dish.as_str()).or_default().push(recipe);
    }

    let mut demand: IndexMap<String, f64> = IndexMap::new();
    let mut unmatched = 0usize;
    for entry in plan {
        let Some(lines) = by_dish.get(entry.dish.as_str()) else {
            unmatched += 1;
            continue;
        };
        for recipe in lines {
            let required = entry.qty * entry.multiplier * recipe.qty_per_dish;
            *demand.entry(recipe.ingredient.clone()).or_insert(0.0) += required;
        }
    }

    if unmatched > 0 {
        tracing::info!("{} sales plan dishes have no recipe, ignored", unmatched);
    }
    demand
}

/// 把原料需求并入订货表: 建议量 = max(原建议, ceil(max(需求 - 当前库存, 0)))
pub fn apply_demand(mut table: OrderTable, demand: &IndexMap<String, f64>) -> OrderTable {
    if demand.is_empty() {
        return table;
    }

    for row in &mut table.rows {
        let required = demand.get(&row.item).copied().unwrap_or(0.0);
        let shortfall = (required - row.current_quantity).max(0.0);
        row.forecasted_ingredient_demand = Some(required);
        row.recommended_order_quantity = row.recommended_order_quantity.max(shortfall.ceil() as u64);
    }
    table.has_demand = true;
    table
}
