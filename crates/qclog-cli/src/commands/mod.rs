pub mod assess;
pub mod inspect;
