pub mod attempt;
pub mod player;
pub mod question;
pub mod round;
pub mod score;

pub use attempt::Attempt;
pub use player::Player;
pub use question::Question;
pub use round::{Round, RoundWithQuestion};
pub use score::{ScoreRow, WinPolicy, Window};
