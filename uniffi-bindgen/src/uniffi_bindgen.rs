//! Generates Swift and Kotlin bindings for the `chatkit` library.

fn main() {
    uniffi::uniffi_bindgen_main();
}
