mod intake;
mod status;
mod user;

pub mod dtos {
    pub use crate::intake::dtos::*;
    pub use crate::user::dtos::*;
}

pub use crate::intake::api::*;
pub use crate::status::api::*;
pub use crate::user::api::*;
