pub mod entry_panel;
pub mod metrics_bar;
pub mod ring;
