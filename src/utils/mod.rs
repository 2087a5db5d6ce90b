pub mod age;
pub mod format;
pub mod ids;
pub mod time;

pub use age::{child_age, gestational_age, ChildAge, GestationalAge, Trimester};
pub use ids::{IdGenerator, RandomIdGenerator};
pub use time::{Millis, Nanos};
