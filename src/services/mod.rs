pub mod passenger_service;
pub mod passenger_service_impl;
pub mod site_service;
pub mod site_service_impl;
pub mod trip_service;
pub mod trip_service_impl;

pub use passenger_service::{CascadeSummary, PassengerError, PassengerService};
pub use passenger_service_impl::SeaOrmPassengerService;
pub use site_service::{SiteError, SiteService};
pub use site_service_impl::SeaOrmSiteService;
pub use trip_service::{TripError, TripService};
pub use trip_service_impl::SeaOrmTripService;
