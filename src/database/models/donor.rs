use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Donor {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub blood_type: String,
    pub products: Option<String>,
    pub num_products: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonor {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub blood_type: String,
    pub products: Option<String>,
    pub num_products: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorChanges {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub blood_type: Option<String>,
    pub products: Option<String>,
    pub num_products: Option<i32>,
}

impl DonorChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date_of_birth.is_none()
            && self.blood_type.is_none()
            && self.products.is_none()
            && self.num_products.is_none()
    }

    pub fn apply(self, donor: &mut Donor) {
        if let Some(name) = self.name {
            donor.name = name;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            donor.date_of_birth = date_of_birth;
        }
        if let Some(blood_type) = self.blood_type {
            donor.blood_type = blood_type;
        }
        if let Some(products) = self.products {
            donor.products = Some(products);
        }
        if let Some(num_products) = self.num_products {
            donor.num_products = num_products;
        }
    }
}

pub fn is_valid_blood_type(value: &str) -> bool {
    BLOOD_TYPES.contains(&value)
}
