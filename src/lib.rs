pub mod config;
pub mod confirmation;
pub mod error;
pub mod gift_list;
pub mod gui;
pub mod operation_lock;
pub mod operation_log;
pub mod rpc;
pub mod types;
pub mod units;
pub mod user_settings;
pub mod wallet;
pub mod wallet_lock;
