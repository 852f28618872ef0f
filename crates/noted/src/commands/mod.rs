/// `noted commit`.
mod commit;
/// `noted folder` and `noted note`.
mod entries;
/// `noted init`.
mod init;
/// `noted status`.
mod status;
/// `noted upload`.
mod upload;
/// `noted workspace`.
mod workspace;

pub use commit::commit;
pub use entries::{add_folder, add_note};
pub use init::init;
pub use status::status;
pub use upload::upload;
pub use workspace::{add_workspace, list_workspaces, remove_workspace};
