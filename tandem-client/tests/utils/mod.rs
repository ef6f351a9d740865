
pub use conference_helpers::*;
pub use mock_connection::*;
pub use mock_media::*;
pub use session_helpers::*;
