mod rtc_connection;
mod rtc_connector;

pub use rtc_connection::*;
pub use rtc_connector::*;
