//! 表单校验
//!
//! 与 UI 无关的输入检查，把字符串输入转换为请求对象。

use multi_inventory_shared::{Credentials, ItemDraft};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
    #[error("invalid item id: {0}")]
    InvalidId(String),
}

pub fn validate_login(username: &str, password: &str) -> Result<Credentials, ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::Required("username"));
    }
    // 密码原样发送，只在校验时忽略空白
    if password.trim().is_empty() {
        return Err(ValidationError::Required("password"));
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_registration(
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<Credentials, ValidationError> {
    let credentials = validate_login(username, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(credentials)
}

/// 商品表单的原始输入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFormInput {
    pub name: String,
    pub barcode: String,
    pub price: String,
    pub location: String,
    pub is_halal: bool,
    pub quantity: String,
}

impl ItemFormInput {
    pub fn from_draft(draft: &ItemDraft) -> Self {
        Self {
            name: draft.name.clone(),
            barcode: draft.barcode.clone(),
            price: draft.price.to_string(),
            location: draft.location.clone(),
            is_halal: draft.is_halal,
            quantity: draft.quantity.to_string(),
        }
    }

    pub fn validate(&self) -> Result<ItemDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required("name"));
        }
        let barcode = self.barcode.trim();
        if barcode.is_empty() {
            return Err(ValidationError::Required("barcode"));
        }

        let price = parse_or_default::<f64>(&self.price, "price")?;
        if !price.is_finite() {
            return Err(ValidationError::NotANumber("price"));
        }
        if price < 0.0 {
            return Err(ValidationError::Negative("price"));
        }
        let quantity = parse_or_default::<i32>(&self.quantity, "quantity")?;
        if quantity < 0 {
            return Err(ValidationError::Negative("quantity"));
        }

        Ok(ItemDraft {
            name: name.to_string(),
            barcode: barcode.to_string(),
            price,
            location: self.location.trim().to_string(),
            is_halal: self.is_halal,
            quantity,
        })
    }
}

/// 空输入视为 0
fn parse_or_default<T>(raw: &str, field: &'static str) -> Result<T, ValidationError>
where
    T: std::str::FromStr + Default,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse().map_err(|_| ValidationError::NotANumber(field))
}

/// 解析 `/inventory/edit/:id` 中的 id
pub fn parse_item_id(raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ValidationError::InvalidId(raw.to_string()))
}

/// 数量输入框，非法或小于 1 时返回 None
pub fn parse_positive_quantity(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|q| *q > 0)
}

/// 购物车行内的数量输入。0 表示移除该行，空输入与非法输入都是错误
pub fn parse_cart_quantity(raw: &str) -> Result<i32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required("quantity"));
    }
    let quantity = raw
        .parse::<i32>()
        .map_err(|_| ValidationError::NotANumber("quantity"))?;
    if quantity < 0 {
        return Err(ValidationError::Negative("quantity"));
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ItemFormInput {
        ItemFormInput {
            name: " Kurma ".into(),
            barcode: "8991\n".into(),
            price: "12.50".into(),
            location: " Rak A ".into(),
            is_halal: true,
            quantity: "40".into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(validate_login("  ", "x"), Err(ValidationError::Required("username")));
        assert_eq!(validate_login("ana", ""), Err(ValidationError::Required("password")));
        assert_eq!(validate_login("ana", "   "), Err(ValidationError::Required("password")));
        let creds = validate_login(" ana ", "secret").unwrap();
        assert_eq!(creds.username, "ana");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn registration_checks_length_and_confirmation() {
        assert_eq!(
            validate_registration("ana", "12345", "12345"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_registration("ana", "123456", "123457"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_registration("ana", "       ", "       "),
            Err(ValidationError::Required("password"))
        );
        assert!(validate_registration("ana", "123456", "123456").is_ok());
    }

    #[test]
    fn login_keeps_password_whitespace() {
        let creds = validate_login("ana", " pass word ").unwrap();
        assert_eq!(creds.password, " pass word ");
    }

    #[test]
    fn item_form_is_trimmed_and_parsed() {
        let draft = input().validate().unwrap();
        assert_eq!(draft.name, "Kurma");
        assert_eq!(draft.barcode, "8991");
        assert_eq!(draft.location, "Rak A");
        assert!((draft.price - 12.5).abs() < 1e-9);
        assert_eq!(draft.quantity, 40);
    }

    #[test]
    fn item_form_rejects_bad_numbers() {
        let mut bad = input();
        bad.price = "abc".into();
        assert_eq!(bad.validate(), Err(ValidationError::NotANumber("price")));

        let mut negative = input();
        negative.quantity = "-1".into();
        assert_eq!(negative.validate(), Err(ValidationError::Negative("quantity")));

        let mut blank = input();
        blank.price.clear();
        blank.quantity.clear();
        let draft = blank.validate().unwrap();
        assert_eq!(draft.price, 0.0);
        assert_eq!(draft.quantity, 0);
    }

    #[test]
    fn item_form_requires_name_and_barcode() {
        let mut missing = input();
        missing.barcode = "  ".into();
        assert_eq!(missing.validate(), Err(ValidationError::Required("barcode")));
    }

    #[test]
    fn draft_round_trips_through_form() {
        let draft = input().validate().unwrap();
        assert_eq!(ItemFormInput::from_draft(&draft).validate().unwrap(), draft);
    }

    #[test]
    fn item_ids_must_be_positive_integers() {
        assert_eq!(parse_item_id("12"), Ok(12));
        assert!(parse_item_id("abc").is_err());
        assert!(parse_item_id("0").is_err());
        assert_eq!(parse_positive_quantity(" 3 "), Some(3));
        assert_eq!(parse_positive_quantity("0"), None);
    }

    #[test]
    fn cart_quantity_rejects_blank_and_garbage() {
        assert_eq!(parse_cart_quantity(""), Err(ValidationError::Required("quantity")));
        assert_eq!(parse_cart_quantity("  "), Err(ValidationError::Required("quantity")));
        assert_eq!(parse_cart_quantity("abc"), Err(ValidationError::NotANumber("quantity")));
        assert_eq!(parse_cart_quantity("1.5"), Err(ValidationError::NotANumber("quantity")));
        assert_eq!(parse_cart_quantity("-2"), Err(ValidationError::Negative("quantity")));
        // 显式输入 0 才会移除该行
        assert_eq!(parse_cart_quantity("0"), Ok(0));
        assert_eq!(parse_cart_quantity(" 4 "), Ok(4));
    }
}
