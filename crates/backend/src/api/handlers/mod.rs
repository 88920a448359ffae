// Dashboard handlers (d400)
pub mod d400_pizza_sales;
