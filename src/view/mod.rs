pub mod image_view;
