use {
    crate::{ExecutionContext, OutOfGas},
    std::fmt::Debug,
};

/// A message carried by a transaction.
pub trait Msg: Debug {
    /// Fully qualified name of the message type, e.g. `/cosmos.bank.v1beta1.MsgSend`.
    fn type_url(&self) -> &str;

    /// The type URL without the leading slash, as used for metric labels.
    fn name(&self) -> &str {
        self.type_url().trim_start_matches('/')
    }
}

impl<M: Msg + ?Sized> Msg for &M {
    fn type_url(&self) -> &str {
        (**self).type_url()
    }
}

impl<M: Msg + ?Sized> Msg for Box<M> {
    fn type_url(&self) -> &str {
        (**self).type_url()
    }
}

/// Executes messages of type `M` against an execution context.
///
/// This is the seam between transaction processing and the modules that own the message types.
/// Handlers charge the gas they use on the context's meter, so their error type has to be able
/// to express running out of it.
pub trait MsgHandler<M> {
    type Response;
    type Error: From<OutOfGas>;

    fn handle(&self, ctx: &mut ExecutionContext, msg: &M) -> Result<Self::Response, Self::Error>;
}

impl<M, F, R, E> MsgHandler<M> for F
where
    F: Fn(&mut ExecutionContext, &M) -> Result<R, E>,
    E: From<OutOfGas>,
{
    type Response = R;
    type Error = E;

    fn handle(&self, ctx: &mut ExecutionContext, msg: &M) -> Result<R, E> {
        self(ctx, msg)
    }
}
