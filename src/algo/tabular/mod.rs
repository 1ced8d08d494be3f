pub mod q_table;
