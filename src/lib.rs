pub mod compare;
pub mod generator;
pub mod problem;
pub mod rank_index;
pub mod rank_map;
pub mod ranker;
pub mod util;
pub mod validator;

pub use problem::{solve, write_answers, ParseError, Problem};
pub use rank_index::{RankIndex, NOT_FOUND};
pub use rank_map::RankMap;
pub use ranker::{BubbleRanker, NaiveRanker, Ranker, Strategy};
