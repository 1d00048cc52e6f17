pub mod donor;
pub mod drink;
pub mod greeting;
pub mod trivia;

pub use donor::{is_valid_blood_type, Donor, DonorChanges, NewDonor, BLOOD_TYPES};
pub use drink::{Drink, DrinkChanges, Ingredient, NewDrink, ShortDrink, ShortIngredient};
pub use greeting::{Greeting, DEFAULT_GREETINGS};
pub use trivia::{Category, NewQuestion, Question};
