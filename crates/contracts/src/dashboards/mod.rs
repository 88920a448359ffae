pub mod d400_pizza_sales;
