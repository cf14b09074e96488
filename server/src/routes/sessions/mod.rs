mod create;
mod end;
mod join;
mod leaderboard;
mod list;
mod status;

pub use self::create::*;
pub use self::end::*;
pub use self::join::*;
pub use self::leaderboard::*;
pub use self::list::*;
pub use self::status::*;
