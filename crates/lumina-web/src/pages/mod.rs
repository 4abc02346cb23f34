//! Page Components

mod thermostat;

pub use thermostat::ThermostatPage;
