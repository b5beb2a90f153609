//! Single-file component structure: block outline, folding and block snippets.

use async_trait::async_trait;
use vuels_core::{SfcBlock, parse_sfc};
use vuels_language::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList, DocumentSymbol, FoldingRange,
    InsertTextFormat, Position, SymbolKind,
};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use super::is_vue_document;

pub const NAME: &str = "vue-sfc";

const BLOCK_SNIPPETS: &[(&str, &str)] = &[
    ("template", "template>\n\t$0\n</template>"),
    ("script setup", "script setup lang=\"ts\">\n$0\n</script>"),
    ("script", "script lang=\"ts\">\n$0\n</script>"),
    ("style scoped", "style scoped>\n$0\n</style>"),
    ("style", "style>\n$0\n</style>"),
];

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| PluginInstance::new(SfcFeatures))
}

struct SfcFeatures;

/// Outline label of a block: its tag and flag attributes, e.g. `style scoped`.
pub fn block_label(block: &SfcBlock) -> String {
    let mut label = block.tag.clone();
    for (name, value) in &block.attrs {
        if value.is_none() {
            label.push(' ');
            label.push_str(name);
        }
    }
    label
}

#[async_trait]
impl PluginFeatures for SfcFeatures {
    #[allow(deprecated)]
    async fn provide_document_symbols(
        &self,
        document: &TextDocument,
    ) -> ServiceResult<Vec<DocumentSymbol>> {
        if !is_vue_document(document) {
            return Ok(Vec::new());
        }
        let sfc = parse_sfc(&document.text);
        let symbols = sfc
            .blocks()
            .into_iter()
            .filter_map(|block| {
                let range = document.range_of(block.loc_start as usize, block.loc_end as usize)?;
                let selection_range = document.range_of(
                    block.loc_start as usize + 1,
                    block.loc_start as usize + 1 + block.tag.len(),
                )?;
                Some(DocumentSymbol {
                    name: block_label(block),
                    detail: block.lang.clone(),
                    kind: SymbolKind::MODULE,
                    tags: None,
                    deprecated: None,
                    range,
                    selection_range,
                    children: None,
                })
            })
            .collect();
        Ok(symbols)
    }

    async fn provide_folding_ranges(
        &self,
        document: &TextDocument,
    ) -> ServiceResult<Vec<FoldingRange>> {
        if !is_vue_document(document) {
            return Ok(Vec::new());
        }
        let ranges = parse_sfc(&document.text)
            .blocks()
            .into_iter()
            .filter_map(|block| {
                let start = document.position_at(block.loc_start as usize)?;
                let end = document.position_at(block.loc_end as usize)?;
                (end.line > start.line).then(|| FoldingRange {
                    start_line: start.line,
                    end_line: end.line - 1,
                    ..Default::default()
                })
            })
            .collect();
        Ok(ranges)
    }

    async fn provide_completion_items(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Option<CompletionList>> {
        if !is_vue_document(document) {
            return Ok(None);
        }
        let offset = document.offset_at(position);
        if !document.text[..offset].ends_with('<') {
            return Ok(None);
        }
        let sfc = parse_sfc(&document.text);
        let inside_block = sfc
            .blocks()
            .iter()
            .any(|b| offset as u32 > b.loc_start && (offset as u32) < b.loc_end);
        if inside_block {
            return Ok(None);
        }

        let items = BLOCK_SNIPPETS
            .iter()
            .map(|(label, snippet)| CompletionItem {
                label: label.to_string(),
                kind: Some(CompletionItemKind::SNIPPET),
                insert_text: Some(snippet.to_string()),
                insert_text_format: Some(InsertTextFormat::SNIPPET),
                ..Default::default()
            })
            .collect();
        Ok(Some(CompletionList {
            is_incomplete: false,
            items,
        }))
    }
}
