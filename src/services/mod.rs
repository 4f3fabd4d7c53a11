pub mod chart_service;
pub mod price_service;
pub mod render_service;
pub mod ticker_service;
pub mod trend_service;
