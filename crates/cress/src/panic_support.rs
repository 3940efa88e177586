//! Turning handler panics into reportable failures.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::localization;

/// Render a panic payload as text.
///
/// String payloads and primitive numbers are shown verbatim; anything else
/// gets a localised description naming the payload's type id.
///
/// # Examples
/// ```
/// use cress::panic_message;
///
/// let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    macro_rules! try_downcast {
        ($($ty:ty),* $(,)?) => {
            $(
                if let Some(value) = payload.downcast_ref::<$ty>() {
                    return value.to_string();
                }
            )*
        };
    }

    try_downcast!(&str, String, i32, u32, i64, u64, isize, usize, f64);
    let ty = format!("{:?}", payload.type_id());
    localization::message_with_args("panic-message-opaque-payload", |args| {
        args.set("type", ty);
    })
}

/// Run `f`, converting a panic into its rendered message.
pub(crate) fn catch<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}
