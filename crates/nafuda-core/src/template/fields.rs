/// A file kind's field letters for the template renderer.
///
/// Implementations form a chain of partial handlers: a kind answers the
/// letters it owns and hands everything else to the shared base fields.
/// `None` means "not a field", and the renderer emits the character as a
/// literal.
pub trait FieldSource {
    /// Renders the field for `directive`, or `None` if it is not a field
    /// letter of this kind.
    fn field(&self, directive: char) -> Option<String>;
}
