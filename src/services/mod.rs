pub mod aggregate_service;
pub mod extract_service;
pub mod workbook_service;
