pub mod passenger;
pub mod site;
pub mod trip;
pub mod user;
