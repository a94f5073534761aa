//! 销售开单的购物车

use thiserror::Error;

use crate::{CreateOrderRequest, Item, OrderLine};

#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    NonPositiveQuantity,
    #[error("insufficient quantity for item {name}: requested {requested}, available {available}")]
    OutOfStock {
        name: String,
        requested: i32,
        available: i32,
    },
    #[error("item {0} is not in the cart")]
    NotInCart(i64),
    #[error("cart is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item_id: i64,
    pub name: String,
    pub barcode: String,
    pub unit_price: f64,
    pub quantity: i32,
    /// 加入购物车时的库存，用于前端预先拦截超卖
    pub available: i32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 加入商品；已在购物车中的商品累加数量
    pub fn add(&mut self, item: &Item, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            return Err(CartError::NonPositiveQuantity);
        }
        let already = self
            .lines
            .iter()
            .find(|l| l.item_id == item.id)
            .map_or(0, |l| l.quantity);
        let requested = already.saturating_add(quantity);
        if requested > item.quantity {
            return Err(CartError::OutOfStock {
                name: item.name.clone(),
                requested,
                available: item.quantity,
            });
        }

        match self.lines.iter_mut().find(|l| l.item_id == item.id) {
            Some(line) => {
                line.quantity = requested;
                line.available = item.quantity;
                line.unit_price = item.price;
            }
            None => self.lines.push(CartLine {
                item_id: item.id,
                name: item.name.clone(),
                barcode: item.barcode.clone(),
                unit_price: item.price,
                quantity,
                available: item.quantity,
            }),
        }
        Ok(())
    }

    /// 直接设置数量，0 表示移除
    pub fn set_quantity(&mut self, item_id: i64, quantity: i32) -> Result<(), CartError> {
        if quantity < 0 {
            return Err(CartError::NonPositiveQuantity);
        }
        if quantity == 0 {
            return if self.remove(item_id) {
                Ok(())
            } else {
                Err(CartError::NotInCart(item_id))
            };
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.item_id == item_id)
            .ok_or(CartError::NotInCart(item_id))?;
        if quantity > line.available {
            return Err(CartError::OutOfStock {
                name: line.name.clone(),
                requested: quantity,
                available: line.available,
            });
        }
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, item_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn total_units(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    pub fn to_request(&self, user_id: Option<String>) -> Result<CreateOrderRequest, CartError> {
        if self.is_empty() {
            return Err(CartError::Empty);
        }
        Ok(CreateOrderRequest {
            user_id,
            items: self
                .lines
                .iter()
                .map(|l| OrderLine {
                    item_id: l.item_id,
                    quantity: l.quantity,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::tests::item;

    #[test]
    fn adding_same_item_merges_lines() {
        let rice = item(1, "Rice", "111", 2.5, 10);
        let mut cart = Cart::new();
        cart.add(&rice, 2).unwrap();
        cart.add(&rice, 3).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        assert!((cart.total() - 12.5).abs() < 1e-9);
        assert_eq!(cart.total_units(), 5);
    }

    #[test]
    fn cannot_exceed_stock() {
        let salt = item(2, "Salt", "222", 1.0, 3);
        let mut cart = Cart::new();
        cart.add(&salt, 2).unwrap();
        let err = cart.add(&salt, 2).unwrap_err();
        assert_eq!(
            err,
            CartError::OutOfStock {
                name: "Salt".into(),
                requested: 4,
                available: 3
            }
        );
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.set_quantity(2, 4).unwrap_err().to_string(),
            "insufficient quantity for item Salt: requested 4, available 3");
    }

    #[test]
    fn zero_or_negative_quantities_are_rejected() {
        let tea = item(3, "Tea", "333", 4.0, 3);
        let mut cart = Cart::new();
        assert_eq!(cart.add(&tea, 0), Err(CartError::NonPositiveQuantity));
        assert_eq!(cart.set_quantity(3, -1), Err(CartError::NonPositiveQuantity));
    }

    #[test]
    fn setting_zero_removes_line() {
        let tea = item(3, "Tea", "333", 4.0, 3);
        let mut cart = Cart::new();
        cart.add(&tea, 1).unwrap();
        cart.set_quantity(3, 0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.set_quantity(3, 0), Err(CartError::NotInCart(3)));
    }

    #[test]
    fn request_requires_lines() {
        let mut cart = Cart::new();
        assert_eq!(cart.to_request(None), Err(CartError::Empty));

        cart.add(&item(1, "Rice", "111", 2.0, 5), 2).unwrap();
        cart.add(&item(2, "Salt", "222", 1.0, 5), 1).unwrap();
        let req = cart.to_request(Some("u-1".into())).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u-1"));
        assert_eq!(
            req.items,
            vec![
                OrderLine { item_id: 1, quantity: 2 },
                OrderLine { item_id: 2, quantity: 1 }
            ]
        );
    }
}
