// handlers/elevated/users - identity administration, administrator role
// required. These routes sit behind the store-refresh middleware, so a
// demoted administrator is locked out as soon as the store says so.

pub mod delete;
pub mod list;
pub mod show;
pub mod update;

pub use delete::user_delete;
pub use list::user_list;
pub use show::user_get;
pub use update::user_put;
