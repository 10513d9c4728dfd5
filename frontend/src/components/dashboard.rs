use crate::api::{ApiError, MediMindApi};
use crate::auth::{logout, use_auth};
use crate::components::upload_dialog::UploadDialog;
use futures::future::try_join;
use leptos::prelude::*;
use leptos::task::spawn_local;
use medimind_shared::{Prescription, Schedule};

mod collections;

/// Authenticated workspace: schedules + prescriptions for the current user.
///
/// Loading is all-or-nothing (both lists or neither), local mutations are
/// applied only after the server acknowledged them, and results of a load
/// that was superseded by a newer one are discarded.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_auth();
    let auth_state = ctx.state;

    let (schedules, set_schedules) = signal(Vec::<Schedule>::new());
    let (prescriptions, set_prescriptions) = signal(Vec::<Prescription>::new());
    let (loading, set_loading) = signal(true);
    let (uploading, set_uploading) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    // 加载周期计数。每次加载前自增，响应返回后比对；
    // 不一致说明该结果属于已被替代的加载，直接丢弃。
    let (load_epoch, set_load_epoch) = signal(0u64);

    // 统一的失败出口：凭据失效时清除会话（路由服务随即送回登录页），
    // 其余错误只弹通知，本地状态保持最后一次确认的值。
    let surface_error = move |e: &ApiError| {
        if matches!(e, ApiError::Auth(_)) {
            logout(&ctx);
        }
        set_notification.try_set(Some((e.message().to_string(), true)));
    };

    let load_all = move || {
        let Some(user_id) = auth_state.with_untracked(|s| s.user_id().map(str::to_string)) else {
            return;
        };
        let epoch = set_load_epoch
            .try_update(|e| {
                *e += 1;
                *e
            })
            .unwrap_or_default();

        set_loading.set(true);
        let api = MediMindApi::from_env();
        spawn_local(async move {
            let result = try_join(
                api.user_schedules(&user_id),
                api.user_prescriptions(&user_id),
            )
            .await;

            // Stale-response guard: a newer load owns the UI now.
            if load_epoch.try_get_untracked() != Some(epoch) {
                return;
            }

            match result {
                Ok((mut fetched_schedules, mut fetched_prescriptions)) => {
                    collections::newest_first(&mut fetched_schedules, |s| s.created_at);
                    collections::newest_first(&mut fetched_prescriptions, |p| p.created_at);
                    set_schedules.try_set(fetched_schedules);
                    set_prescriptions.try_set(fetched_prescriptions);
                }
                Err(e) => {
                    // 任一失败整体视为失败：保留旧状态，只记录并提示
                    web_sys::console::error_1(
                        &format!("[Dashboard] load failed: {}", e).into(),
                    );
                    surface_error(&e);
                }
            }
            set_loading.try_set(false);
        });
    };

    // 凭据可用时加载（首次挂载与认证变化都会触发）
    Effect::new(move |_| {
        let state = auth_state.get();
        if state.is_authenticated() && !state.is_loading {
            load_all();
        }
    });

    let handle_upload = move |file: web_sys::File| {
        if uploading.get_untracked() {
            return;
        }
        let Some(user_id) = auth_state.with_untracked(|s| s.user_id().map(str::to_string)) else {
            return;
        };

        set_uploading.set(true);
        let api = MediMindApi::from_env();
        spawn_local(async move {
            match api.upload_prescription(&file, &user_id).await {
                Ok(outcome) => {
                    let names = collections::medicine_summary(&outcome.medicines);
                    let message = if names.is_empty() {
                        outcome.message
                    } else {
                        format!("Schedules created for: {}", names)
                    };
                    set_notification.try_set(Some((message, false)));
                    // 计划由服务端派生，成功后整体重载而不是本地合并
                    load_all();
                }
                Err(e) => {
                    surface_error(&e);
                }
            }
            set_uploading.try_set(false);
        });
    };

    let handle_toggle = move |id: String, enabled: bool| {
        let api = MediMindApi::from_env();
        spawn_local(async move {
            match api.toggle_schedule(&id, enabled).await {
                Ok(ack) => {
                    // 服务端确认后才修改本地状态
                    set_schedules.try_update(|list| collections::apply_toggle(list, &id, enabled));
                    set_notification.try_set(Some((ack.message, false)));
                }
                Err(e) => {
                    // 空更新触发重渲染，把复选框拉回已确认的值
                    set_schedules.try_update(|_| {});
                    surface_error(&e);
                }
            }
        });
    };

    let handle_delete = move |id: String| {
        let api = MediMindApi::from_env();
        spawn_local(async move {
            match api.delete_schedule(&id).await {
                Ok(ack) => {
                    set_schedules.try_update(|list| collections::remove_by_id(list, &id));
                    set_notification.try_set(Some((ack.message, false)));
                }
                Err(e) => {
                    surface_error(&e);
                }
            }
        });
    };

    let on_logout = move |_| logout(&ctx);

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || {
                    set_notification.try_set(None);
                },
                std::time::Duration::from_secs(3),
            );
        }
    });

    let total_schedules = move || schedules.with(|s| s.len());
    let active_schedules = move || schedules.with(|s| s.iter().filter(|x| x.enabled).count());
    let total_prescriptions = move || prescriptions.with(|p| p.len());

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            let (_, is_err) = notification.get().unwrap();
                            if is_err {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>{move || notification.get().unwrap().0}</span>
                        </div>
                    </div>
                </Show>

                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <a class="btn btn-ghost text-xl">"MediMind"</a>
                        <span class="badge badge-neutral hidden md:inline-flex">
                            {move || auth_state.get().session.map(|s| s.email).unwrap_or_default()}
                        </span>
                    </div>
                    <div class="flex-none gap-2">
                        <UploadDialog on_upload=handle_upload uploading=uploading />
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            "Sign out"
                        </button>
                    </div>
                </div>

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Schedules"</div>
                        <div class="stat-value text-primary">{total_schedules}</div>
                        <div class="stat-desc">"reminder schedules on file"</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Active"</div>
                        <div class="stat-value text-success">{active_schedules}</div>
                        <div class="stat-desc">"currently sending reminders"</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Prescriptions"</div>
                        <div class="stat-value text-secondary">{total_prescriptions}</div>
                        <div class="stat-desc">"documents uploaded"</div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex items-center justify-between p-6 pb-2">
                            <div>
                                <h3 class="card-title">"Medication schedules"</h3>
                                <p class="text-base-content/70 text-sm">"Toggle or remove reminders for each medicine."</p>
                            </div>
                            <button on:click=move |_| load_all() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                                <svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke="currentColor"
                                    class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }>
                                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 4v5h.582m15.356 2A8.001 8.001 0 004.582 9m0 0H9m11 11v-5h-.581m0 0a8.003 8.003 0 01-15.357-2m15.357 2H15" />
                                </svg>
                            </button>
                        </div>

                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Medicine"</th>
                                        <th class="hidden md:table-cell">"Dosage"</th>
                                        <th class="hidden md:table-cell">"Frequency"</th>
                                        <th>"Timings"</th>
                                        <th>"Enabled"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || total_schedules() == 0 && !loading.get()>
                                        <tr>
                                            <td colspan="6" class="text-center py-8 text-base-content/50">
                                                "No schedules yet. Upload a prescription to get started."
                                            </td>
                                        </tr>
                                    </Show>
                                    <Show when=move || loading.get() && total_schedules() == 0>
                                        <tr>
                                            <td colspan="6" class="text-center py-8 text-base-content/50">
                                                <span class="loading loading-spinner loading-md"></span> " Loading..."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || schedules.get()
                                        key=|s| s.id.clone()
                                        children=move |schedule| {
                                            let toggle_id = schedule.id.clone();
                                            let delete_id = schedule.id.clone();
                                            let row_id = schedule.id.clone();
                                            // 读信号而不是行快照，失败回滚后复选框能跟着恢复
                                            let enabled_now = move || {
                                                schedules.with(|list| {
                                                    list.iter()
                                                        .find(|s| s.id == row_id)
                                                        .map(|s| s.enabled)
                                                        .unwrap_or(false)
                                                })
                                            };
                                            view! {
                                                <tr>
                                                    <td>
                                                        <div class="font-bold">{schedule.medicine_name}</div>
                                                        <div class="text-xs opacity-50">{schedule.created_at.date_label()}</div>
                                                    </td>
                                                    <td class="hidden md:table-cell">{schedule.dosage}</td>
                                                    <td class="hidden md:table-cell">{schedule.frequency}</td>
                                                    <td>
                                                        <div class="flex flex-wrap gap-1">
                                                            {schedule.timings.iter().map(|t| view! {
                                                                <span class="badge badge-accent badge-outline">{t.clone()}</span>
                                                            }).collect_view()}
                                                        </div>
                                                    </td>
                                                    <td>
                                                        <input
                                                            type="checkbox"
                                                            class="toggle toggle-success"
                                                            prop:checked=enabled_now
                                                            on:change=move |ev| handle_toggle(toggle_id.clone(), event_target_checked(&ev))
                                                        />
                                                    </td>
                                                    <td>
                                                        <button
                                                            on:click=move |_| handle_delete(delete_id.clone())
                                                            class="btn btn-ghost btn-sm text-error hover:bg-error/10"
                                                        >
                                                            "Delete"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="p-6 pb-2">
                            <h3 class="card-title">"Uploaded prescriptions"</h3>
                            <p class="text-base-content/70 text-sm">"The source documents your schedules were derived from."</p>
                        </div>

                        <div class="overflow-x-auto w-full">
                            <table class="table w-full">
                                <thead>
                                    <tr>
                                        <th>"Uploaded"</th>
                                        <th>"Extracted text"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || total_prescriptions() == 0 && !loading.get()>
                                        <tr>
                                            <td colspan="2" class="text-center py-8 text-base-content/50">
                                                "Nothing uploaded yet."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || prescriptions.get()
                                        key=|p| p.id.clone()
                                        children=move |prescription| {
                                            view! {
                                                <tr>
                                                    <td class="whitespace-nowrap align-top">
                                                        <div class="font-mono text-sm">{prescription.created_at.label()}</div>
                                                        <div class="text-xs opacity-50 font-mono">{prescription.id}</div>
                                                    </td>
                                                    <td class="text-sm opacity-80">
                                                        {collections::excerpt(&prescription.raw_text, 160)}
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
