mod answer;
mod leaderboard;
mod participant;
mod question;
mod rate_limit;
mod session;

pub use self::answer::*;
pub use self::leaderboard::*;
pub use self::participant::*;
pub use self::question::*;
pub use self::rate_limit::*;
pub use self::session::*;
