mod ids;
mod options;
mod question;

pub use ids::NodeId;
pub use options::{
    BoundKey, DEFAULT_MAX_ANSWER, DEFAULT_MAX_QUESTIONS, DEFAULT_OPERAND_MAX,
    DEFAULT_OPERAND_MIN, GLOBAL_MAX, MAX_COPIES, MIN_COPIES, MathOptions,
};
pub use question::{Format, Operation, Question};
