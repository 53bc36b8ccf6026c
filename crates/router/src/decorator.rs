/// Wraps a value into another one of the same capability, typically a handler into a handler
pub trait Decorator<In> {
    type Out;

    fn decorate(&self, raw: In) -> Self::Out;
}
