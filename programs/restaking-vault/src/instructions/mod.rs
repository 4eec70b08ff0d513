pub mod add_protocol;
pub mod deposit;
pub mod get_available_balance;
pub mod initialize;
pub mod protocol_accounts;
pub mod restake;
pub mod toggle_protocol;
pub mod withdraw;

pub use add_protocol::*;
pub use deposit::*;
pub use get_available_balance::*;
pub use initialize::*;
pub use protocol_accounts::*;
pub use restake::*;
pub use toggle_protocol::*;
pub use withdraw::*;
