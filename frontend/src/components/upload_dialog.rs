use leptos::prelude::*;

/// Prescription upload modal.
///
/// The selected file lives in the `<input>` element itself; we only read
/// it out on submit, which keeps JS handles out of reactive state.
/// While an upload is in flight the submit button stays disabled, so a
/// second upload cannot start before the first one resolves.
#[component]
pub fn UploadDialog(
    #[prop(into)] on_upload: Callback<web_sys::File>,
    #[prop(into)] uploading: Signal<bool>,
) -> impl IntoView {
    let (open, set_open) = signal(false);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let input_ref = NodeRef::<leptos::html::Input>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let file = input_ref
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));

        if let Some(file) = file {
            on_upload.run(file);
            if let Some(input) = input_ref.get() {
                input.set_value("");
            }
            set_open.set(false);
        }
    };

    view! {
        <button
            class="btn btn-primary gap-2"
            disabled=move || uploading.get()
            on:click=move |_| set_open.set(true)
        >
            {move || if uploading.get() {
                view! { <span class="loading loading-spinner loading-xs"></span> "Uploading..." }.into_any()
            } else {
                view! { <span class="text-lg leading-none">"+"</span> "Upload prescription" }.into_any()
            }}
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Upload a prescription"</h3>
                <p class="py-4 text-base-content/70">
                    "Pick a photo or scan of your prescription. The server reads it and "
                    "creates reminder schedules for every medicine it finds."
                </p>

                <form on:submit=on_submit class="space-y-4">
                    <div class="form-control">
                        <label for="prescription_file" class="label">
                            <span class="label-text">"Prescription image"</span>
                        </label>
                        <input
                            id="prescription_file"
                            type="file"
                            accept="image/*"
                            required
                            node_ref=input_ref
                            class="file-input file-input-bordered w-full"
                        />
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_open.set(false)>"Cancel"</button>
                        <button type="submit" disabled=move || uploading.get() class="btn btn-primary">
                            "Upload"
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
