/// Consuming teardown of a set of GPU resources.
///
/// Taking `self` by value makes a second release of the same handles
/// impossible.
pub trait Release {
    fn release(self);
}
