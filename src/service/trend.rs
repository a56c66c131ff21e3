use super::usage::QuantityMatrix;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// 对每个物品做 数量 ~ 快照序号 的最小二乘直线拟合, 预测下一期数量 (负值截为 0)
///
/// 拟合退化 (少于两个点或结果非有限值) 的物品没有预测, 不影响其他物品。
pub fn predict_next_quantities(matrix: &QuantityMatrix) -> BTreeMap<String, Option<f64>> {
    let Some(&last) = matrix.indices.last() else {
        return BTreeMap::new();
    };
    let xs: Vec<f64> = matrix.indices.iter().map(|&i| i as f64).collect();
    let target = (last + 1) as f64;

    let predictions: BTreeMap<String, Option<f64>> = matrix
        .items
        .par_iter()
        .map(|(item, ys)| {
            let prediction = fit_line(&xs, ys).map(|(slope, intercept)| {
                (slope * target + intercept).max(0.0)
            });
            (item.clone(), prediction.filter(|p| p.is_finite()))
        })
        .collect();

    let skipped = predictions.values().filter(|p| p.is_none()).count();
    if skipped > 0 {
        tracing::warn!("No trend prediction for {} of {} items", skipped, predictions.len());
    }
    predictions
}

/// 返回 (斜率, 截距)
fn fit_line(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (sxy, sxx) = xs
        .iter()
        .zip(ys)
        .fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });

    if sxx == 0.0 || !sxy.is_finite() {
        return None;
    }

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}
