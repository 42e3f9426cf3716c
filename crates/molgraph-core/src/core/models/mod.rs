pub mod identity;
pub mod record;
