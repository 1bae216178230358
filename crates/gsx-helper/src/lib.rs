pub use gsx_abi;
pub use gsx_core;
pub use log;

// Re-export the types the macro expansion names, so component crates
// only need this crate in scope.
pub use gsx_abi::{XfMethod, XfStatus};
pub use gsx_core::{Dispatcher, ExternalFunction};

/// Export a GoldSim-callable C symbol for an [`ExternalFunction`] type.
///
/// Expands to the exact four-argument callback the host expects,
/// backed by one process-wide dispatcher constructed on first call via
/// `Default`. The component itself still scopes its resources to
/// Initialize/Cleanup; the dispatcher only exists so state survives
/// between host calls.
///
/// Raw buffer lengths are derived from the component's declared
/// argument counts (or its packed-payload span for `Calculate`), and
/// the whole invocation runs under `catch_unwind` so a panic becomes
/// `XF_FAILURE` instead of unwinding into the host's frame.
///
/// ```ignore
/// export_external_function!(my_function, MyFunction);
/// ```
#[macro_export]
macro_rules! export_external_function {
    ($symbol:ident, $function:ty) => {
        /// # Safety
        ///
        /// Must be called with the GoldSim external-function
        /// convention: `inargs` and `outargs` valid for the extents
        /// implied by the reported argument counts (for a time-series
        /// input, the packed extent its header declares).
        #[no_mangle]
        pub unsafe extern "C" fn $symbol(
            method: i32,
            status: *mut i32,
            inargs: *const f64,
            outargs: *mut f64,
        ) {
            static CELL: ::std::sync::Mutex<
                ::std::option::Option<$crate::Dispatcher<$function>>,
            > = ::std::sync::Mutex::new(::std::option::Option::None);

            let outcome = ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| {
                let mut guard = match CELL.lock() {
                    ::std::result::Result::Ok(guard) => guard,
                    // A previous call panicked mid-invoke; the
                    // dispatcher state is still usable.
                    ::std::result::Result::Err(poisoned) => poisoned.into_inner(),
                };
                let dispatcher = guard.get_or_insert_with(|| {
                    $crate::Dispatcher::new(<$function as ::std::default::Default>::default())
                });

                let header_len = dispatcher.header_span(method);
                let in_len = if inargs.is_null() || header_len == 0 {
                    0
                } else {
                    let header = unsafe { ::std::slice::from_raw_parts(inargs, header_len) };
                    dispatcher.input_span(method, header)
                };
                let inputs: &[f64] = if in_len == 0 || inargs.is_null() {
                    &[]
                } else {
                    unsafe { ::std::slice::from_raw_parts(inargs, in_len) }
                };

                let out_len = dispatcher.output_span(method);
                let outputs: &mut [f64] = if out_len == 0 || outargs.is_null() {
                    &mut []
                } else {
                    unsafe { ::std::slice::from_raw_parts_mut(outargs, out_len) }
                };

                dispatcher.invoke(method, inputs, outputs).code()
            }));

            let code = match outcome {
                ::std::result::Result::Ok(code) => code,
                ::std::result::Result::Err(_) => {
                    $crate::log::error!(
                        "panic absorbed at the {} boundary",
                        stringify!($symbol)
                    );
                    $crate::XfStatus::Failure.code()
                }
            };
            if !status.is_null() {
                *status = code;
            }
        }
    };
}
