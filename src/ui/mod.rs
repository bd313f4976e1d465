//! UI module - reusable rendering pieces shared by the app views

pub mod components;
