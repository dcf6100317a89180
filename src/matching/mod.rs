pub mod adjudicator;
pub mod candidates;
pub mod media;
pub mod name;
pub mod similarity;
pub mod top_n;
