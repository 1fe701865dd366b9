pub mod episode;
pub mod monte_carlo;
pub mod policy;
pub mod q_table;
pub mod returns;
pub mod value_table;
