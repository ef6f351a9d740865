mod conference;
mod connection;
mod error;
mod media;
mod monitor;
mod rtc;
mod session;
mod signaling_client;

pub use conference::*;
pub use connection::*;
pub use error::*;
pub use media::*;
pub use monitor::*;
pub use rtc::*;
pub use session::*;
pub use signaling_client::*;
