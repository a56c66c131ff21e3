/// 菜品配方: 每份菜品消耗的原料数量
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub dish: String,
    pub ingredient: String,
    pub unit: Option<String>,
    pub qty_per_dish: f64,
}

/// 销售计划条目
#[derive(Debug, Clone, PartialEq)]
pub struct SalesPlanEntry {
    pub dish: String,
    pub qty: f64,
    pub multiplier: f64,
}

impl SalesPlanEntry {
    pub fn new(dish: impl Into<String>, qty: f64) -> Self {
        Self {
            dish: dish.into(),
            qty,
            multiplier: 1.0,
        }
    }
}
