pub mod a100_order_line;
