use std::fmt::Debug;

use courier_di::Build;
use courier_shared_contracts::id::IdService;
use courier_utils::trace_instrument;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Build)]
pub struct IdServiceImpl;

impl IdService for IdServiceImpl {
    #[trace_instrument(skip(self))]
    fn generate<I: From<Uuid> + Debug + Send + 'static>(&self) -> I {
        Uuid::new_v4().into()
    }
}
