/// One section of a prompt: fixed text or a template rendered from the
/// request context.
#[derive(Debug, Clone)]
pub enum InstructionParam<TCtx> {
    String(&'static str),
    Func(fn(&TCtx) -> String),
}

impl<TCtx> InstructionParam<TCtx> {
    pub fn as_string(&self, context: &TCtx) -> String {
        match self {
            Self::String(s) => (*s).to_string(),
            Self::Func(f) => f(context),
        }
    }
}

/// Render every section and join them with blank lines.
pub fn get_prompt<TCtx>(instructions: &[InstructionParam<TCtx>], context: &TCtx) -> String {
    instructions
        .iter()
        .map(|param| param.as_string(context))
        .collect::<Vec<_>>()
        .join("\n\n")
}
