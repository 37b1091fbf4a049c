//! # tablemind-engine: multi-agent Texas Hold'em table
//!
//! Runs a Hold'em match between 2 to 9 players whose decisions come from
//! pluggable [`decision::DecisionProvider`]s (language models, scripted
//! bots, heuristics). Each hand deals two hole cards, then flop, turn and
//! river with one betting pass per street, then a showdown after which every
//! surviving player reflects on its opponents.
//!
//! ## Core Modules
//!
//! - [`cards`] - Suit, Rank, Card and their text forms
//! - [`deck`] - Seeded 52-card deck with ChaCha20 RNG
//! - [`hand`] - 7-card evaluation and the [`hand::HandEvaluator`] seam
//! - [`player`] - Player state, actions and opinions
//! - [`rules`] - Raise accounting, tie rule, blinds and action validation
//! - [`decision`] - Decision providers and reply parsing
//! - [`table`] - Pot and seats
//! - [`betting`] - Single-pass betting rounds
//! - [`showdown`] - Pot award, elimination and reflection
//! - [`record`] - Round events, round record and JSON export
//! - [`logger`] - JSONL history of finished rounds
//! - [`game`] - Hand and match orchestration
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use tablemind_engine::cards::Card;
//! use tablemind_engine::hand::{HandEvaluator, StandardEvaluator};
//!
//! let hole: [Card; 2] = ["AH".parse().unwrap(), "KH".parse().unwrap()];
//! let board: Vec<Card> = ["QH", "JH", "10H", "2C", "3D"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//!
//! let score = StandardEvaluator.evaluate(&hole, &board).unwrap();
//! println!("{} ({})", score.category().name(), score.value());
//! ```
//!
//! ## Deterministic Dealing
//!
//! ```rust
//! use tablemind_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! a.shuffle();
//! b.shuffle();
//! assert_eq!(a.deal(5).unwrap(), b.deal(5).unwrap());
//! ```

pub mod betting;
pub mod cards;
pub mod deck;
pub mod decision;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod record;
pub mod rules;
pub mod showdown;
pub mod table;
