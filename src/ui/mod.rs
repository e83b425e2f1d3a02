pub mod chat_view;
pub mod input_area;
pub mod sidebar;
