pub mod delete_product;
pub mod index_product;
pub mod search_products;

pub use delete_product::DeleteProductUseCase;
pub use index_product::IndexProductUseCase;
pub use search_products::SearchProductsUseCase;
