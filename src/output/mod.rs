mod format;
mod history;
mod reply;
mod sessions;

pub(crate) use history::{HistoryTableOptions, output_history_json, print_history_table};
pub(crate) use reply::output_reply_json;
pub(crate) use sessions::{SessionListOptions, output_session_list_json, print_session_list};
