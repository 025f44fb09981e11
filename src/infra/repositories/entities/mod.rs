//! SeaORM entity definitions, kept separate from the domain models.

pub mod user;

#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
