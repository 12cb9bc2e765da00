use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::object_id;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    Percentage,
    FixedAmount,
    Voucher,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    #[default]
    Active,
    Inactive,
}

impl OfferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OfferStatus::Active => "active",
            OfferStatus::Inactive => "inactive",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserEligibility {
    #[default]
    All,
    NewUsers,
    ExistingUsers,
}

/// Secondary code shown in the code carousel after the primary one.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalPromoCode {
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_purchase_amount: Option<f64>,
}

/// One entry of the ordered code sequence `[primary, ...additional]`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferCode {
    pub code: String,
    pub primary: bool,
    pub description: Option<String>,
    pub discount_value: Option<f64>,
    pub expiry_date: Option<i64>,
    pub min_purchase_amount: Option<f64>,
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "object_id::deserialize_optional"
    )]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub offer_type: OfferType,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub voucher_code: Option<String>,
    #[serde(default)]
    pub discount_value: f64, // Percent or currency amount depending on offer_type
    #[serde(default)]
    pub max_discount_limit: Option<f64>, // Percentage offers only
    #[serde(default)]
    pub min_purchase_amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub start_date: Option<i64>,
    #[serde(default)]
    pub end_date: Option<i64>,
    #[serde(default)]
    pub status: OfferStatus,
    #[serde(default)]
    pub total_usage_limit: Option<i64>,
    #[serde(default)]
    pub per_user_usage_limit: Option<i64>,
    #[serde(default)]
    pub total_usage_count: i64,
    #[serde(default)]
    pub balance_amount: Option<f64>, // Vouchers only
    #[serde(default)]
    pub is_single_use: bool, // Vouchers only
    #[serde(default)]
    pub applicable_categories: Vec<String>,
    #[serde(default)]
    pub applicable_courses: Vec<String>,
    #[serde(default)]
    pub user_eligibility: UserEligibility,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub redeem_link: Option<String>,
    #[serde(default)]
    pub redeem_steps: String, // One instruction per line
    #[serde(default)]
    pub offer_details: String, // One term per line
    #[serde(default)]
    pub priority_order: i64,
    #[serde(default)]
    pub login_required: bool,
    #[serde(default)]
    pub additional_promo_codes: Vec<AdditionalPromoCode>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

impl Offer {
    /// The code that is meaningful for this offer type.
    pub fn primary_code(&self) -> Option<&str> {
        match self.offer_type {
            OfferType::Voucher => non_empty(self.voucher_code.as_ref()),
            OfferType::Percentage | OfferType::FixedAmount => non_empty(self.promo_code.as_ref()),
        }
    }

    /// Clear whichever of promo/voucher code does not belong to the offer type.
    pub fn normalize_codes(&mut self) {
        match self.offer_type {
            OfferType::Voucher => self.promo_code = None,
            OfferType::Percentage | OfferType::FixedAmount => {
                self.voucher_code = None;
                self.balance_amount = None;
                self.is_single_use = false;
            }
        }
        if self.offer_type != OfferType::Percentage {
            self.max_discount_limit = None;
        }
    }

    /// Primary code followed by the additional codes, skipping blank entries.
    pub fn code_sequence(&self) -> Vec<OfferCode> {
        let primary = self.primary_code().map(|code| OfferCode {
            code: code.to_string(),
            primary: true,
            description: None,
            discount_value: Some(self.discount_value),
            expiry_date: self.end_date,
            min_purchase_amount: Some(self.min_purchase_amount),
        });

        let additional = self
            .additional_promo_codes
            .iter()
            .filter(|extra| !extra.code.trim().is_empty())
            .map(|extra| OfferCode {
                code: extra.code.trim().to_string(),
                primary: false,
                description: extra.description.clone(),
                discount_value: extra.discount_value,
                expiry_date: extra.expiry_date,
                min_purchase_amount: extra.min_purchase_amount,
            });

        primary.into_iter().chain(additional).collect()
    }

    /// Check the type-specific invariants before the offer is stored.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.primary_code().is_none() {
            return Err(match self.offer_type {
                OfferType::Voucher => "Voucher code is required for voucher offers",
                _ => "Promo code is required for this offer type",
            }
            .to_string());
        }
        if self.discount_value < 0.0 {
            return Err("Discount value cannot be negative".to_string());
        }
        if self.offer_type == OfferType::Percentage && self.discount_value > 100.0 {
            return Err("Percentage discount cannot exceed 100".to_string());
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err("End date must be after start date".to_string());
            }
        }
        Ok(())
    }

    pub fn is_live(&self, now: i64) -> bool {
        self.status == OfferStatus::Active
            && self.start_date.is_none_or(|start| start <= now)
            && self.end_date.is_none_or(|end| now <= end)
    }

    pub fn usage_exhausted(&self) -> bool {
        if self.offer_type == OfferType::Voucher && self.is_single_use && self.total_usage_count > 0 {
            return true;
        }
        self.total_usage_limit
            .is_some_and(|limit| self.total_usage_count >= limit)
    }

    /// Discount granted on a purchase of `amount`, in the offer currency.
    pub fn discount_for(&self, amount: f64) -> f64 {
        if amount <= 0.0 || amount < self.min_purchase_amount {
            return 0.0;
        }
        let discount = match self.offer_type {
            OfferType::Percentage => {
                let raw = amount * self.discount_value / 100.0;
                match self.max_discount_limit {
                    Some(cap) if cap > 0.0 => raw.min(cap),
                    _ => raw,
                }
            }
            OfferType::FixedAmount => self.discount_value,
            OfferType::Voucher => self.balance_amount.unwrap_or(0.0),
        };
        discount.clamp(0.0, amount)
    }

    pub fn redeem_step_lines(&self) -> Vec<&str> {
        lines(&self.redeem_steps)
    }

    pub fn offer_detail_lines(&self) -> Vec<&str> {
        lines(&self.offer_details)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_offer() -> Offer {
        serde_json::from_value(serde_json::json!({
            "title": "Exam season",
            "offerType": "percentage",
            "promoCode": "EXAM20",
            "discountValue": 20.0,
            "maxDiscountLimit": 150.0,
            "minPurchaseAmount": 100.0,
            "additionalPromoCodes": [
                { "code": "EXAM10", "discountValue": 10.0 },
                { "code": "  " },
                { "code": "FRIEND5" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn code_sequence_starts_with_primary_and_skips_blanks() {
        let codes: Vec<String> = sample_offer().code_sequence().into_iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["EXAM20", "EXAM10", "FRIEND5"]);
    }

    #[test]
    fn voucher_uses_voucher_code() {
        let mut offer = sample_offer();
        offer.offer_type = OfferType::Voucher;
        offer.voucher_code = Some("GIFT500".into());
        assert_eq!(offer.primary_code(), Some("GIFT500"));

        offer.normalize_codes();
        assert!(offer.promo_code.is_none());
        assert!(offer.max_discount_limit.is_none());
    }

    #[test]
    fn invariants_require_matching_code() {
        let mut offer = sample_offer();
        assert!(offer.check_invariants().is_ok());

        offer.offer_type = OfferType::Voucher;
        assert!(offer.check_invariants().is_err());

        offer.offer_type = OfferType::Percentage;
        offer.discount_value = 120.0;
        assert!(offer.check_invariants().is_err());
    }

    #[test]
    fn percentage_discount_is_capped() {
        let offer = sample_offer();
        assert_eq!(offer.discount_for(50.0), 0.0);
        assert_eq!(offer.discount_for(500.0), 100.0);
        assert_eq!(offer.discount_for(1000.0), 150.0);
    }

    #[test]
    fn fixed_and_voucher_discounts_never_exceed_amount() {
        let mut offer = sample_offer();
        offer.min_purchase_amount = 0.0;
        offer.offer_type = OfferType::FixedAmount;
        offer.discount_value = 300.0;
        assert_eq!(offer.discount_for(200.0), 200.0);

        offer.offer_type = OfferType::Voucher;
        offer.balance_amount = Some(75.0);
        assert_eq!(offer.discount_for(200.0), 75.0);
    }

    #[test]
    fn live_window_and_usage() {
        let mut offer = sample_offer();
        offer.start_date = Some(100);
        offer.end_date = Some(200);
        assert!(!offer.is_live(50));
        assert!(offer.is_live(150));
        assert!(!offer.is_live(250));
        offer.status = OfferStatus::Inactive;
        assert!(!offer.is_live(150));

        offer.total_usage_limit = Some(3);
        offer.total_usage_count = 3;
        assert!(offer.usage_exhausted());
    }

    #[test]
    fn splits_newline_delimited_text() {
        let mut offer = sample_offer();
        offer.redeem_steps = "Copy the code\n\n  Open the store \nApply at checkout".into();
        assert_eq!(
            offer.redeem_step_lines(),
            vec!["Copy the code", "Open the store", "Apply at checkout"]
        );
    }
}
