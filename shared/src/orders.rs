//! 销售单统计与核单 (order checker) 逻辑

use crate::{OrderStatus, SalesOrder, SalesOrderItem};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SalesSummary {
    pub orders: usize,
    pub pending: usize,
    /// 已取消的订单不计入营业额
    pub revenue: f64,
}

impl SalesSummary {
    pub fn from_orders(orders: &[SalesOrder]) -> Self {
        orders.iter().fold(Self::default(), |mut acc, order| {
            acc.orders += 1;
            match order.status {
                OrderStatus::Pending => {
                    acc.pending += 1;
                    acc.revenue += order.total_price;
                }
                OrderStatus::Completed => acc.revenue += order.total_price,
                OrderStatus::Cancelled => {}
            }
            acc
        })
    }
}

/// 最新的订单排在最前；时间相同时按 id 倒序
pub fn sort_newest_first(orders: &mut [SalesOrder]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

pub fn pending_orders(orders: &[SalesOrder]) -> Vec<&SalesOrder> {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FulfillmentProgress {
    pub fulfilled: usize,
    pub total: usize,
}

impl FulfillmentProgress {
    pub fn of(order: &SalesOrder) -> Self {
        Self {
            fulfilled: order.items.iter().filter(|i| i.is_fulfilled).count(),
            total: order.items.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.fulfilled == self.total
    }
}

/// 扫到某个商品时应当勾选的订单行：该商品第一条未完成的行
pub fn line_to_fulfill(order: &SalesOrder, item_id: i64) -> Option<&SalesOrderItem> {
    order
        .items
        .iter()
        .find(|line| line.item_id == item_id && !line.is_fulfilled)
}

/// 在本地订单副本上记录某行的完成状态，返回是否找到该行
pub fn mark_line(order: &mut SalesOrder, line_id: i64, is_fulfilled: bool) -> bool {
    match order.items.iter_mut().find(|line| line.id == line_id) {
        Some(line) => {
            line.is_fulfilled = is_fulfilled;
            true
        }
        None => false,
    }
}

/// 扫码时在本地副本上立即勾选该商品第一条未完成的行，返回行 id。
/// 请求失败时用 `mark_line(order, id, false)` 撤销。
pub fn claim_line(order: &mut SalesOrder, item_id: i64) -> Option<i64> {
    let line_id = line_to_fulfill(order, item_id)?.id;
    mark_line(order, line_id, true);
    Some(line_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn line(id: i64, item_id: i64, fulfilled: bool) -> SalesOrderItem {
        SalesOrderItem {
            id,
            sales_order_id: 1,
            item_id,
            item_name: None,
            quantity: 1,
            price_at_sale: 2.0,
            is_fulfilled: fulfilled,
        }
    }

    fn order(id: i64, status: OrderStatus, total: f64, hour: u32) -> SalesOrder {
        SalesOrder {
            id,
            user_id: None,
            total_price: total,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
            updated_at: Default::default(),
            items: Vec::new(),
        }
    }

    #[test]
    fn revenue_skips_cancelled_orders() {
        let orders = vec![
            order(1, OrderStatus::Pending, 10.0, 1),
            order(2, OrderStatus::Completed, 5.0, 2),
            order(3, OrderStatus::Cancelled, 100.0, 3),
        ];
        let summary = SalesSummary::from_orders(&orders);
        assert_eq!(summary.orders, 3);
        assert_eq!(summary.pending, 1);
        assert!((summary.revenue - 15.0).abs() < 1e-9);
        assert_eq!(pending_orders(&orders).len(), 1);
    }

    #[test]
    fn newest_orders_come_first() {
        let mut orders = vec![
            order(1, OrderStatus::Pending, 1.0, 1),
            order(2, OrderStatus::Pending, 1.0, 5),
            order(3, OrderStatus::Pending, 1.0, 5),
        ];
        sort_newest_first(&mut orders);
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn scan_picks_first_unfulfilled_line_for_item() {
        let mut o = order(1, OrderStatus::Pending, 6.0, 1);
        o.items = vec![line(10, 7, true), line(11, 7, false), line(12, 8, false)];

        assert_eq!(line_to_fulfill(&o, 7).map(|l| l.id), Some(11));
        assert_eq!(line_to_fulfill(&o, 9), None);

        assert!(mark_line(&mut o, 11, true));
        assert_eq!(line_to_fulfill(&o, 7), None);
        assert!(!mark_line(&mut o, 99, true));
    }

    #[test]
    fn repeated_scans_claim_successive_lines() {
        let mut o = order(1, OrderStatus::Pending, 6.0, 1);
        o.items = vec![line(10, 7, false), line(11, 8, false), line(12, 7, false)];

        // 两次连续扫码（第一次请求尚未返回）应勾选不同的行
        assert_eq!(claim_line(&mut o, 7), Some(10));
        assert_eq!(claim_line(&mut o, 7), Some(12));
        assert_eq!(claim_line(&mut o, 7), None);
        assert!(!o.items[1].is_fulfilled);

        // 请求失败时撤销，下一次扫码重新拿到这一行
        assert!(mark_line(&mut o, 10, false));
        assert_eq!(claim_line(&mut o, 7), Some(10));
    }

    #[test]
    fn progress_is_complete_only_with_lines() {
        let mut o = order(1, OrderStatus::Pending, 6.0, 1);
        assert!(!FulfillmentProgress::of(&o).is_complete());

        o.items = vec![line(10, 7, true), line(11, 8, false)];
        let progress = FulfillmentProgress::of(&o);
        assert_eq!(progress, FulfillmentProgress { fulfilled: 1, total: 2 });
        assert!(!progress.is_complete());

        mark_line(&mut o, 11, true);
        assert!(FulfillmentProgress::of(&o).is_complete());
    }
}
