use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::extract::FromRef;
        use leptos::prelude::LeptosOptions;
        use std::sync::Arc;

        use crate::services::{PromptModel, SharedModel};

        #[derive(FromRef, Clone)]
        pub struct AppState {
            pub leptos_options: LeptosOptions,
            pub model: SharedModel,
        }

        impl AppState {
            pub fn new(leptos_options: LeptosOptions, model: impl PromptModel + 'static) -> Self {
                Self {
                    leptos_options,
                    model: Arc::new(model),
                }
            }
        }
    }
}
