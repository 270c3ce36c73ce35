//! Terminal values. Descending into any of these finds nothing.

use super::Node;

macro_rules! terminal_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Node for $ty {
                #[allow(clippy::clone_on_copy)]
                fn to_json(&self) -> serde_json::Value {
                    serde_json::Value::from(self.clone())
                }
            }
        )*
    };
}

terminal_node!(
    String,
    &'static str,
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
);

impl Node for char {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::String(self.to_string())
    }
}

impl Node for () {
    fn is_null(&self) -> bool {
        true
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}
