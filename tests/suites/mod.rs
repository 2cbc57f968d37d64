mod layout;
mod render;
