pub mod error;
pub mod event;
pub mod marketplace;
pub mod notification;
pub mod swap;
pub mod ws;

pub use error::{ApiErrorBody, ErrorKind};
pub use event::{CreateEventRequest, EventResponse, EventStatus};
pub use marketplace::MarketplaceEntryResponse;
pub use notification::{NotificationKind, NotificationMessage};
pub use swap::{ProposeSwapRequest, RespondSwapRequest, SwapRequestResponse, SwapStatus};
pub use ws::{WsCloseCode, WsServerMessage};
