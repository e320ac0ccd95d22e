use crate::{init_tracing, Classification};

#[test]
fn blittable_covers_both_struct_classes() {
    assert!(Classification::BlittableStruct.is_blittable());
    assert!(Classification::GenericBlittableStruct.is_blittable());
    assert!(!Classification::NonBlittableStruct.is_blittable());
    assert!(!Classification::ReferenceType.is_blittable());
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
