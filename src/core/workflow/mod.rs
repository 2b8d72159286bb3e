pub mod booking_decision;
pub mod in_flight;
