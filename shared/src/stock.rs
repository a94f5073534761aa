//! 库存视图使用的纯函数：统计、搜索、条码查找

use crate::Item;

/// 数量不高于此值的商品视为低库存
pub const LOW_STOCK_THRESHOLD: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InventorySummary {
    pub distinct_items: usize,
    pub total_units: i64,
    pub low_stock: usize,
    pub stock_value: f64,
}

impl InventorySummary {
    pub fn from_items(items: &[Item]) -> Self {
        items.iter().fold(Self::default(), |mut acc, item| {
            acc.distinct_items += 1;
            acc.total_units += i64::from(item.quantity.max(0));
            if item.quantity <= LOW_STOCK_THRESHOLD {
                acc.low_stock += 1;
            }
            acc.stock_value += item.price * f64::from(item.quantity.max(0));
            acc
        })
    }
}

pub fn is_low_stock(item: &Item) -> bool {
    item.quantity <= LOW_STOCK_THRESHOLD
}

/// 按名称、条码或位置做大小写不敏感的子串匹配，结果按名称排序
///
/// 空查询返回全部商品。
pub fn search_items<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let needle = query.trim().to_lowercase();
    let mut found: Vec<&Item> = items
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.name.to_lowercase().contains(&needle)
                || item.barcode.to_lowercase().contains(&needle)
                || item.location.to_lowercase().contains(&needle)
        })
        .collect();
    found.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
    found
}

/// 扫码结果与条码精确匹配（忽略两端空白）
pub fn find_by_barcode<'a>(items: &'a [Item], barcode: &str) -> Option<&'a Item> {
    let code = barcode.trim();
    if code.is_empty() {
        return None;
    }
    items.iter().find(|item| item.barcode == code)
}

/// 调整库存数量，结果不低于 0
pub fn adjust_quantity(current: i32, delta: i32) -> i32 {
    current.saturating_add(delta).max(0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(id: i64, name: &str, barcode: &str, price: f64, quantity: i32) -> Item {
        Item {
            id,
            name: name.to_string(),
            barcode: barcode.to_string(),
            price,
            location: String::new(),
            is_halal: true,
            quantity,
            created_at: Default::default(),
            updated_at: Default::default(),
        }
    }

    #[test]
    fn summary_counts_units_value_and_low_stock() {
        let items = vec![
            item(1, "Rice", "111", 2.0, 10),
            item(2, "Salt", "222", 0.5, 5),
            item(3, "Tea", "333", 4.0, 0),
        ];
        let summary = InventorySummary::from_items(&items);
        assert_eq!(summary.distinct_items, 3);
        assert_eq!(summary.total_units, 15);
        assert_eq!(summary.low_stock, 2);
        assert!((summary.stock_value - 22.5).abs() < 1e-9);
        assert_eq!(InventorySummary::from_items(&[]), InventorySummary::default());
    }

    #[test]
    fn search_matches_name_barcode_and_location() {
        let mut shelf = item(3, "tea", "333", 4.0, 1);
        shelf.location = "Shelf B".to_string();
        let items = vec![
            item(1, "Rice", "111", 2.0, 10),
            item(2, "Brown rice", "222", 3.0, 10),
            shelf,
        ];

        let names: Vec<&str> = search_items(&items, "RICE").iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Brown rice", "Rice"]);

        assert_eq!(search_items(&items, "22")[0].id, 2);
        assert_eq!(search_items(&items, "shelf b")[0].id, 3);
        assert_eq!(search_items(&items, "  ").len(), 3);
        assert!(search_items(&items, "coffee").is_empty());
    }

    #[test]
    fn barcode_lookup_is_exact_and_trimmed() {
        let items = vec![item(1, "Rice", "8991", 2.0, 10), item(2, "Salt", "89912", 1.0, 1)];
        assert_eq!(find_by_barcode(&items, " 8991\n").map(|i| i.id), Some(1));
        assert_eq!(find_by_barcode(&items, "899"), None);
        assert_eq!(find_by_barcode(&items, ""), None);
    }

    #[test]
    fn quantity_never_drops_below_zero() {
        assert_eq!(adjust_quantity(3, 1), 4);
        assert_eq!(adjust_quantity(0, -1), 0);
        assert_eq!(adjust_quantity(2, -5), 0);
    }
}
